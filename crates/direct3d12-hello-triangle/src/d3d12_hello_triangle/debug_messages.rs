use tracing::warn;
use windows::Win32::Graphics::Dxgi::*;

/// Drains the DXGI info queue into the log. Only the debug layer fills it.
pub fn print_dxgi_debug_messages(info_queue: Option<&IDXGIInfoQueue>) {
    let Some(queue) = info_queue else {
        warn!("DXGI info queue not available");
        return;
    };

    let num_messages = unsafe { queue.GetNumStoredMessages(DXGI_DEBUG_ALL) };
    for i in 0..num_messages {
        let mut message_size: usize = 0;
        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, None, &mut message_size) }.is_err() {
            warn!("Error getting size for DXGI message {}", i);
            continue;
        }

        // Backed by u64s so the message header is suitably aligned.
        let mut buffer = vec![0u64; message_size.div_ceil(std::mem::size_of::<u64>())];
        let message = buffer.as_mut_ptr() as *mut DXGI_INFO_QUEUE_MESSAGE;
        if unsafe { queue.GetMessage(DXGI_DEBUG_ALL, i, Some(message), &mut message_size) }.is_err() {
            warn!("Error getting DXGI message {}", i);
            continue;
        }

        let message = unsafe { &*message };
        let description = unsafe {
            std::slice::from_raw_parts(message.pDescription as *const u8, message.DescriptionByteLength)
        };
        let description = String::from_utf8_lossy(description);
        let severity = match message.Severity {
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_CORRUPTION => "CORRUPTION",
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_ERROR => "ERROR",
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_WARNING => "WARNING",
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_INFO => "INFO",
            DXGI_INFO_QUEUE_MESSAGE_SEVERITY_MESSAGE => "MESSAGE",
            _ => "UNKNOWN",
        };
        warn!(
            "DXGI Debug [{} ID:{}]: {}",
            severity,
            message.ID,
            description.trim_end_matches('\0').trim()
        );
    }
    unsafe { queue.ClearStoredMessages(DXGI_DEBUG_ALL) };
}
