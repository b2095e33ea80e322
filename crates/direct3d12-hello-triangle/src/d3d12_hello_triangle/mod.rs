pub use frame_fence::FRAME_COUNT;

pub mod adapter;
pub mod bind_to_window;
pub mod compile_shader;
pub mod create_device;
pub mod create_pipeline_state;
pub mod create_root_signature;
pub mod create_vertex_buffer;
pub mod d3d12_timeline;
pub mod debug_messages;
pub mod on_destroy;
pub mod populate_command_list;
pub mod render;
pub mod resources;
pub mod swap_chain_surface;
pub mod transition_barrier;
