/// Integration tests
mod basic_integration;
