/// Unit tests for the analytics core through the public API
mod analytics_tests;
mod streak_tests;
