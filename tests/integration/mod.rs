/// Integration tests that drive the server against a real database file
mod journal_workflow;
