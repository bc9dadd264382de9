pub mod reconstructor;
