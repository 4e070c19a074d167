mod constructor_tests;
mod diagnostics_tests;
mod member_tests;
mod operator_tests;
mod pending_tests;
mod type_graph_tests;
