use core_affinity;
use crossbeam::thread;
use std::panic;

/// Sets `out[i] = row(i)` for every row, splitting the rows into contiguous chunks that are
/// handled by up to `num_threads` threads (the calling thread takes the first chunk). Every
/// row is computed independently, so the result doesn't depend on the number of threads.
///
/// # Arguments
/// * `out` - The rows being written to. Each thread only ever touches its own chunk.
/// * `num_threads` - Upper bound on the number of threads used.
/// * `bind_threads` - Pins the spawned threads to cores, if there are enough of them. The
///                    calling thread is left alone.
/// * `row` - Computes a single row given its index.
pub fn parallel_rows<T, F>(out: &mut [T], num_threads: usize, bind_threads: bool, row: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let num_threads = num_threads.max(1).min(out.len().max(1));
    if num_threads <= 1 {
        for (i, o) in out.iter_mut().enumerate() {
            *o = row(i);
        }
        return;
    }

    // Check if we will go ahead and bind threads (that is, if we can or not):
    let core_ids = match core_affinity::get_core_ids() {
        Some(ids) if bind_threads && ids.len() >= num_threads => ids,
        _ => Vec::new(),
    };

    let chunk_size = (out.len() + num_threads - 1) / num_threads;
    let row = &row;
    let core_ids = &core_ids;

    let result = thread::scope(move |s| {
        let mut chunks = out.chunks_mut(chunk_size).enumerate();
        let first = chunks.next();

        for (chunk_index, chunk) in chunks {
            s.spawn(move |_| {
                if let Some(&core_id) = core_ids.get(chunk_index) {
                    core_affinity::set_for_current(core_id);
                }
                fill_chunk(chunk, chunk_index * chunk_size, row);
            });
        }

        if let Some((_, chunk)) = first {
            fill_chunk(chunk, 0, row);
        }
    });

    // Forward a worker's panic to the caller:
    if let Err(payload) = result {
        panic::resume_unwind(payload);
    }
}

fn fill_chunk<T, F>(chunk: &mut [T], start: usize, row: &F)
where
    F: Fn(usize) -> T,
{
    for (i, o) in chunk.iter_mut().enumerate() {
        *o = row(start + i);
    }
}
