pub mod synthetic_cloud;
