//! Declaration dialect detection

use std::path::Path;
use std::str::FromStr;

/// Source dialect of an API declaration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `.d.ts`
    TypeScriptDeclaration,
    /// `.d.ets`
    ArkTsDeclaration,
    /// `.ts`
    TypeScript,
    /// `.ets`
    ArkTs,
}

impl Dialect {
    /// Every dialect, compound suffixes first
    pub const ALL: [Self; 4] = [
        Self::TypeScriptDeclaration,
        Self::ArkTsDeclaration,
        Self::TypeScript,
        Self::ArkTs,
    ];

    /// File name suffix, dot included
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::TypeScriptDeclaration => ".d.ts",
            Self::ArkTsDeclaration => ".d.ets",
            Self::TypeScript => ".ts",
            Self::ArkTs => ".ets",
        }
    }

    /// Detect the dialect from a file path
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|dialect| name.len() > dialect.suffix().len() && name.ends_with(dialect.suffix()))
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.suffix()[1..])
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.to_string() == wanted)
            .ok_or_else(|| format!("unknown dialect '{s}' (expected d.ts, d.ets, ts or ets)"))
    }
}
