/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
/// Question, settings, and score storage operations.
pub mod trivia_store;
