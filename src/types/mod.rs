// Type definitions, split by audience:
// - db: sea-orm entities
// - dto: request/response payloads on the wire
// - internal: claims, enums, and validated inputs flowing between layers
pub mod db;
pub mod dto;
pub mod internal;
