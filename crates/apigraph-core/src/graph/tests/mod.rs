mod tests_load;
mod tests_memory;
mod tests_model;
mod tests_neo4j_client;
