//! Unit tests for genbuiltins

mod fixtures;
mod test_generator;
mod test_run;
