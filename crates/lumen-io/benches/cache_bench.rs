// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{criterion_group, criterion_main, Criterion};
use lumen_core::{
    asset::{Asset, AssetConfig, AssetId},
    vfs::DiskVfs,
};
use lumen_io::{AssetCache, RegisterOptions, Source};
use std::hint::black_box;

struct Blob(Vec<u8>);
impl Asset for Blob {}

fn bench_cache(c: &mut Criterion) {
    let mut cache = AssetCache::new(DiskVfs::new("."));
    cache.register_loader_fn(|ctx| Ok(Blob(ctx.source_bytes(0)?.into_owned())));

    // Setup 1,000 registered and constructed entries
    let ids: Vec<AssetId> = (0..1_000)
        .map(|i| AssetId::named(&format!("blob_{i}")).unwrap())
        .collect();
    for id in &ids {
        cache
            .register::<Blob>(*id, vec![Source::inline(vec![0u8; 64])], AssetConfig::None, RegisterOptions::default())
            .unwrap();
        cache.use_asset::<Blob>(id).unwrap();
    }

    let mut group = c.benchmark_group("Asset Cache");

    group.bench_function("use_asset (hit)", |b| {
        b.iter(|| {
            for id in &ids {
                let blob = cache.use_asset::<Blob>(id).unwrap();
                black_box(blob.0.len());
            }
        });
    });

    group.bench_function("query_asset", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(cache.query_asset(id));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cache);
criterion_main!(benches);
