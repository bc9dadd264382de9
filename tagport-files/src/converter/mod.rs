pub mod collision;
pub mod render_geometry;
pub mod resource;
pub mod settings;

#[cfg(test)]
mod tests;
