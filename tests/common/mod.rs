#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::Path;

/// A runtime block with the full set of context lines
pub fn runtime_block(message: &str, proc_name: &str, usr: &str) -> String {
    format!(
        "runtime error: {message}\n\
         proc name: {proc_name}\n\
         \x20 source file: code/{proc_name}.dm,10\n\
         \x20 usr: {usr}\n\
         \x20 src: the source object\n\
         \x20 src.loc: the floor (1,1,1)\n\
         call stack:\n\
         {proc_name}(): frame one\n"
    )
}

pub fn hard_deletion(type_name: &str, failures: i64) -> String {
    format!("Path : {type_name} \nFailures : {failures}\nqdel() Count : 1\n")
}

pub fn create_test_log(dir: &Path, filename: &str, content: &str) -> Result<()> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(())
}
