//! Demonstrates recycling buffer memory through a shared pool.

use std::io::{Read, Seek, SeekFrom, Write};

use size_class_pool::{Buffer, GapFill, SizeClassPool};

fn main() {
    let pool = SizeClassPool::new();

    for round in 0..3 {
        let mut buffer = Buffer::builder(&pool).gap_fill(GapFill::Zeroed).build();

        writeln!(buffer, "round {round}: {}", "x".repeat(100)).unwrap();

        buffer.seek(SeekFrom::Start(0)).unwrap();
        let mut line = String::new();
        buffer.read_to_string(&mut line).unwrap();

        print!("{line}");
        println!(
            "buffer length {}, capacity {}, retained blocks before close {}",
            buffer.len(),
            buffer.capacity(),
            pool.retained_blocks()
        );

        buffer.close();
    }

    println!("retained after all rounds: {}", pool.retained_blocks());
}
