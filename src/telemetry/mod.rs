pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

pub fn export() -> LogCtx<ops::export::Export> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn import() -> LogCtx<ops::import::Import> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
