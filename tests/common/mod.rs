// Each test binary compiles this module separately and uses its own
// subset of the helpers
#![allow(dead_code)]

pub mod wiremock_helpers;
