use std::slice;

use glow::HasContext;

/// Uploads `data` to the buffer bound at `target` as its native-endian bytes.
pub(super) fn buffer_upload_f32(gl: &glow::Context, target: u32, data: &[f32], usage: u32) {
    // f32 has no padding and u8 has alignment 1, so the byte view covers
    // exactly the same initialized memory.
    let bytes = unsafe { slice::from_raw_parts(data.as_ptr().cast::<u8>(), size_of_val(data)) };
    unsafe { gl.buffer_data_u8_slice(target, bytes, usage) };
}
