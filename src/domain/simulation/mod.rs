pub mod overrides;
