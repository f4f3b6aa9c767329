use std::sync::Arc;

use cancellation::{CancellationToken, CancellationTokenSource};
use flume::{Receiver, Sender};
use phong_trace_core::{render_row, Camera, Image, RaytraceError, Scene, V3};

/// One row's worth of finished pixels, sent back from a worker thread to
/// the assembler. Rows are independent units of work: a worker never
/// touches any row but the one it was handed, so the final assembly step
/// needs no locking, only `width` contiguous writes per message.
struct RowResult {
    y: usize,
    pixels: Vec<V3>,
}

fn render_one_row(scene: &Scene, camera: &dyn Camera, y: usize, width: usize) -> Vec<V3> {
    // render_row writes into an Image, which a lone worker thread isn't
    // handed a full one of; build a throwaway single-row image and lift
    // its pixels back out.
    let mut row_image = Image::new(width as i64, 1).expect("row width is already validated by the caller");
    render_row(scene, camera, 0, width, &mut row_image);
    (0..width).map(|x| row_image.get(x, 0)).collect()
}

fn worker_loop(
    scene: &Arc<Scene>,
    camera: &Arc<dyn Camera + Send + Sync>,
    width: usize,
    cancellation_token: &CancellationToken,
    rows: &Receiver<usize>,
    results: &Sender<RowResult>,
) {
    for y in rows.iter() {
        if cancellation_token.is_canceled() {
            return;
        }
        let pixels = render_one_row(scene, camera.as_ref(), y, width);
        if results.send(RowResult { y, pixels }).is_err() {
            return;
        }
    }
}

/// Renders `scene` through `camera` using `thread_count` worker threads,
/// each pulling row indices from a shared bounded channel and rendering
/// that row independently (spec §5: scene and camera are read-only and
/// shared; the image is row-partitioned so no two workers ever write the
/// same pixel). Blocks until every row has been rendered or a worker
/// fails to report back.
pub fn render_parallel(
    scene: Arc<Scene>,
    camera: Arc<dyn Camera + Send + Sync>,
    width: i64,
    height: i64,
    thread_count: u32,
) -> Result<Image, RaytraceError> {
    let mut image = Image::new(width, height)?;
    let width = image.width();
    let height = image.height();

    let cts = CancellationTokenSource::new();
    let (row_sender, row_receiver) = flume::bounded::<usize>(height.min(256));
    let (result_sender, result_receiver) = flume::unbounded::<RowResult>();

    let handles: Vec<_> = (0..thread_count.max(1))
        .map(|id| {
            let scene = scene.clone();
            let camera = camera.clone();
            let cancellation_token = cts.token().clone();
            let row_receiver = row_receiver.clone();
            let result_sender = result_sender.clone();
            std::thread::Builder::new()
                .name(format!("render-worker-{id}"))
                .spawn(move || worker_loop(&scene, &camera, width, &cancellation_token, &row_receiver, &result_sender))
                .expect("failed to spawn render worker thread")
        })
        .collect();

    drop(result_sender);
    for y in 0..height {
        if row_sender.send(y).is_err() {
            break;
        }
    }
    drop(row_sender);

    for RowResult { y, pixels } in result_receiver.iter() {
        for (x, color) in pixels.into_iter().enumerate() {
            image.set(x, y, color);
        }
    }

    for handle in handles {
        handle.join().expect("render worker thread panicked");
    }

    Ok(image)
}
