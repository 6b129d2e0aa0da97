/// Router Module Index
///
/// Organizes the HTTP surface by resource. Unlike a tiered router layout,
/// access control here is uniform: the whole `/api` surface sits behind the
/// gate middleware, and the gate's allowlist decides which individual
/// endpoints are public.

/// Project collection: list, save, delete, validate-key, reorder.
pub mod projects;

/// Image collection: multipart upload and binary fetch.
pub mod images;
