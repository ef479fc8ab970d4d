use anyhow::Result;
use serde::Serialize;
use std::io;

use crate::output::{self, config::OutputConfig, types::{Envelope, Meta}};

pub fn print_plan<T: Serialize>(op: &'static str, plan: &T, meta: Option<Meta>) -> Result<()> {
    let env = Envelope::plan(op, plan, meta)?;
    output::emit(&env, OutputConfig::from_env(), &mut io::stdout().lock())?;
    Ok(())
}

pub fn print_result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<()> {
    let env = Envelope::result(op, result, meta)?;
    output::emit(&env, OutputConfig::from_env(), &mut io::stdout().lock())?;
    Ok(())
}
