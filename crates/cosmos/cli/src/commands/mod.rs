mod device_operations;
mod self_test;

pub(crate) use device_operations::*;
pub(crate) use self_test::self_test_command;
