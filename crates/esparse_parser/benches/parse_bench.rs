//! Parse throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esparse_parser::{parse_script, parse_with_options, ParserOptions};

const FIXTURE: &str = r#"
"use strict";
class EventEmitter {
    #listeners = new Map();
    on(name, handler) {
        const bucket = this.#listeners.get(name) ?? [];
        bucket.push(handler);
        this.#listeners.set(name, bucket);
        return this;
    }
    emit(name, ...args) {
        const bucket = this.#listeners.get(name);
        if (!bucket) return false;
        for (const handler of bucket) {
            try {
                handler(...args);
            } catch (error) {
                reportError(error);
            }
        }
        return bucket.length > 0;
    }
}

function* range(start, end, step = 1) {
    for (let i = start; i < end; i += step) {
        yield i;
    }
}

const squares = [...range(0, 32)].map(n => n * n).filter(n => n % 2 === 0);
const lookup = { squares, [`key${squares.length}`]: true };
const { squares: copied = [], ...rest } = lookup;

async function drain(emitter) {
    let total = 0;
    for (const n of copied) {
        total += await Promise.resolve(n);
    }
    emitter.emit("drained", total, rest);
    return total ** 2;
}
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_fixture", |b| {
        b.iter(|| parse_script(black_box(FIXTURE)).unwrap())
    });
    c.bench_function("parse_fixture_with_locations", |b| {
        let options = ParserOptions {
            location_tracking: true,
            ..ParserOptions::default()
        };
        b.iter(|| parse_with_options(black_box(FIXTURE), options).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
