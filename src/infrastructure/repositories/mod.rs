//! Repository Implementations

mod descriptor;

pub use descriptor::{
    descriptor_file_name, parse_descriptor, DescriptorOverrides, DescriptorTemplate,
    JsonDescriptorRepository,
};
