pub mod mii;
