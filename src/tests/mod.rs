pub(crate) mod support;

mod inventory_tests;
