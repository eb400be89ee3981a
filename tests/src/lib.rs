#![cfg(test)]

mod utils;

mod mapping {
    mod allocation;
    mod operations;
}
