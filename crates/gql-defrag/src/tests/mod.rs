mod selection_resolver_tests;
mod utils;
