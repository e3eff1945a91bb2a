pub mod otx_rest;
