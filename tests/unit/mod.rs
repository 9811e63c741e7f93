/// Unit tests
mod basic_tests;
