pub mod named_tests;
