pub mod dto;
pub mod entity;
pub mod handler;
pub mod membership;
pub mod service;
