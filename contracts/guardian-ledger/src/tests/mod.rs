
mod events_test;
mod ownership_test;
