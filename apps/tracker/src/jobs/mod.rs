// Job applications: list/filter/sort, create, status updates, edit, delete.
// Handlers validate at the boundary; repository functions only ever see
// validated payloads and whitelisted sort tokens.

pub mod form;
pub mod handlers;
pub mod query;
pub mod repository;
