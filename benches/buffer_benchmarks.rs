//! Benchmarks for the editing and output hot paths.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use runpad_buffer::TextBuffer;
use runpad_core::{LineKind, Transcript};

/// Generates a script-like text of `lines` lines.
fn generate_script(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("value_{} = input('Enter value {}: ')\n", i, i))
        .collect()
}

/// Every keystroke hands the buffer a full snapshot of the editor.
fn bench_sync_keystroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_keystroke");

    for size in [100, 1000, 10000].iter() {
        let text = generate_script(*size);
        let middle = text.len() / 2;
        let mut edited = text.clone();
        // ASCII text, any byte index is a char boundary
        edited.insert(middle, 'x');

        group.bench_with_input(BenchmarkId::new("middle", size), &edited, |b, edited| {
            b.iter_with_setup(
                || TextBuffer::from(text.as_str()),
                |mut buffer| {
                    black_box(buffer.sync(black_box(edited)));
                    buffer
                },
            )
        });
    }

    group.finish();
}

fn bench_sync_paste(c: &mut Criterion) {
    let base = generate_script(1000);
    let pasted = format!("{}{}", base, generate_script(1000));

    c.bench_function("sync_paste_1000_lines", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base.as_str()),
            |mut buffer| {
                black_box(buffer.sync(black_box(&pasted)));
                buffer
            },
        )
    });
}

fn bench_undo_redo(c: &mut Criterion) {
    let base = generate_script(1000);

    c.bench_function("undo_redo_100_edits", |b| {
        b.iter_with_setup(
            || {
                let mut buffer = TextBuffer::from(base.as_str());
                for i in 0..100 {
                    buffer.insert(i * 10, "# ").unwrap();
                }
                buffer
            },
            |mut buffer| {
                while buffer.undo().is_ok() {}
                while buffer.redo().is_ok() {}
                buffer
            },
        )
    });
}

/// Child output arrives in pipe-sized chunks that split lines anywhere.
fn bench_transcript_push(c: &mut Criterion) {
    let output = generate_script(10000);
    let chunks: Vec<&str> = output
        .as_bytes()
        .chunks(4096)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect();

    c.bench_function("transcript_push_10000_lines", |b| {
        b.iter(|| {
            let mut transcript = Transcript::new(5000);
            for chunk in &chunks {
                transcript.push(LineKind::Stdout, black_box(chunk));
            }
            black_box(transcript.len())
        })
    });
}

criterion_group!(
    benches,
    bench_sync_keystroke,
    bench_sync_paste,
    bench_undo_redo,
    bench_transcript_push,
);
criterion_main!(benches);
