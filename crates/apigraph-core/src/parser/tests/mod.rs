mod tests_comment;
mod tests_unit;
