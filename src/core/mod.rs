//! Core模块 - 包含所有核心业务逻辑

pub mod error;
pub mod wuxing;
pub mod ganzhi;
pub mod models;
pub mod rules;
pub mod definitions;
pub mod cache;
pub mod rule_engine;
pub mod time_layer;
pub mod special;
pub mod analysis;

#[cfg(test)]
mod sim_integration_tests;
