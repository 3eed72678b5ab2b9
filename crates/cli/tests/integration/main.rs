mod common;
mod workflow_tests;
