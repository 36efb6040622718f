/// Database models for ToolScout
///
/// # Models
///
/// - `user`: Registered accounts (the user directory)
/// - `tool`: Catalog entries with derived rating columns
/// - `review`: One rating+text per (user, tool) pair
/// - `comment`: Flat/threaded comments attached to a review
///
/// Each model owns its CRUD operations as associated functions taking a
/// `&PgPool`, in the form `Model::create(&pool, data)`.

pub mod comment;
pub mod review;
pub mod tool;
pub mod user;
