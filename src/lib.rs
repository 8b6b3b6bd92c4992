//! Workspace-level integration tests for multifit live in `tests/`.
