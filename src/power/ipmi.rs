//! IPMI backend: chassis power through ipmitool, liveness through ping.

pub mod ipmi_backend;
