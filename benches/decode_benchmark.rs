//! Decoding benchmarks for ALICE-Column-Meta

use alice_column_meta::{ColumnMetadata, SegmentColumns, SegmentProperties};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn generate_segment(columns: usize) -> String {
    let names: Vec<String> = (0..columns).map(|i| format!("col_{}", i)).collect();
    let mut text = format!("segment.dimension.column.names = {}\n", names.join(","));

    for (i, name) in names.iter().enumerate() {
        let data_type = ["INT", "LONG", "STRING", "BYTES"][i % 4];
        let (min, max) = match data_type {
            "STRING" => ("aaa".to_string(), "zzz".to_string()),
            "BYTES" => ("00".to_string(), "ffff".to_string()),
            _ => (i.to_string(), (i * 1000).to_string()),
        };
        text.push_str(&format!(
            "{n}.cardinality = {c}\n\
             {n}.totalDocs = 100000\n\
             {n}.dataType = {t}\n\
             {n}.bitsPerElement = 10\n\
             {n}.dictionaryElementSize = 8\n\
             {n}.columnType = DIMENSION\n\
             {n}.isSorted = false\n\
             {n}.hasNullValue = false\n\
             {n}.hasInvertedIndex = true\n\
             {n}.isSingleValued = true\n\
             {n}.maxMultiValueElements = 0\n\
             {n}.totalNumberOfEntries = 100000\n\
             {n}.minValue = {min}\n\
             {n}.maxValue = {max}\n\
             {n}.partitionFunction = Murmur\n\
             {n}.numPartitions = 8\n\
             {n}.partitionValues = 1,5\n",
            n = name,
            c = 1000 + i,
            t = data_type,
            min = min,
            max = max
        ));
    }
    text
}

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_properties");

    for columns in [10, 100] {
        let text = generate_segment(columns);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("{}_columns", columns), |b| {
            b.iter(|| black_box(&text).parse::<SegmentProperties>().unwrap())
        });
    }

    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let props: SegmentProperties = generate_segment(100).parse().unwrap();

    group.bench_function("single_column", |b| {
        b.iter(|| ColumnMetadata::from_config(black_box("col_42"), &props).unwrap())
    });

    group.throughput(Throughput::Elements(100));
    group.bench_function("segment_100_columns", |b| {
        b.iter(|| SegmentColumns::from_config(black_box(&props)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, parse_benchmark, decode_benchmark);
criterion_main!(benches);
