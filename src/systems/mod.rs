pub(crate) mod system_service;
