//! Business services
//!
//! The flows that combine validation, authorization, transactional writes
//! and push notifications live here. Plain CRUD endpoints call the
//! repository layer directly from their handlers.

pub mod loyalty;
pub mod orders;
pub mod payment;
pub mod surplus;
