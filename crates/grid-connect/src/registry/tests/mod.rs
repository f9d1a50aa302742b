mod common;
mod detail;
