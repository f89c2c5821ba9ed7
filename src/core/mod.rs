pub mod poller;
pub mod refresher;
pub mod render;

#[cfg(test)]
pub mod testing;
