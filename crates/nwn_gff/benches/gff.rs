use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn area_instances(count: u32) -> nwn_gff::Gff {
    use nwn_common::FourCC;
    use nwn_gff::{Gff, GffList, GffStruct};

    let mut gff = Gff::new(FourCC::new(b"GIT "));
    let creatures: GffList = (0..count)
        .map(|i| {
            let mut creature = GffStruct::new(4);
            creature.write_field("Tag", format!("creature_{i}"));
            creature.write_field("XPosition", i as f32);
            creature.write_field("YPosition", (i * 2) as f32);
            creature.write_field("Appearance_Type", (i % 300) as u16);
            creature
        })
        .collect();
    gff.write_field("Creature List", creatures);
    gff
}

pub mod read {
    use divan::Bencher;
    use nwn_gff::{Gff, RawGff};

    fn get_input() -> Vec<u8> {
        super::area_instances(1_000).to_bytes().unwrap()
    }

    #[divan::bench]
    fn raw_tables(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(RawGff::read(data.as_slice()).unwrap());
        });
    }

    #[divan::bench]
    fn build_tree(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(Gff::read(data.as_slice()).unwrap());
        });
    }
}

pub mod write {
    use divan::Bencher;

    #[divan::bench(args = [10, 1_000])]
    fn encode_tree(bencher: Bencher, count: u32) {
        bencher
            .with_inputs(|| super::area_instances(count))
            .bench_refs(|gff| {
                divan::black_box(gff.to_bytes().unwrap());
            });
    }
}
