//! Data type pipeline benchmarks using divan

use metatypes::{TypeRegistry, Value};
use metatypes::types::validators::{ip, semver};

fn main() {
    divan::main();
}

mod cast {
    use super::*;

    #[divan::bench(args = ["Integer", "Number", "Date", "DateTime", "Boolean", "UUID"])]
    fn by_type(bencher: divan::Bencher, alias: &str) {
        let registry = TypeRegistry::with_defaults();
        let data_type = registry.create(alias, None).unwrap();
        let input = match alias {
            "Date" | "DateTime" => Value::from("24.12.2024"),
            "Boolean" => Value::from("yes"),
            "UUID" => Value::from("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}"),
            _ => Value::from("1234.5"),
        };
        bencher.bench_local(|| data_type.validate(divan::black_box(&input)));
    }

    #[divan::bench]
    fn relative_date(bencher: divan::Bencher) {
        let data_type = TypeRegistry::with_defaults().create("Date", None).unwrap();
        let input = Value::from("+3m");
        bencher.bench_local(|| data_type.cast(divan::black_box(&input)));
    }
}

mod list {
    use super::*;

    #[divan::bench(args = [10, 100, 1000])]
    fn parse_integers(bencher: divan::Bencher, len: usize) {
        let registry = TypeRegistry::with_defaults();
        let list = registry
            .create("List", Some(&serde_json::json!({"value_type": "Integer"})))
            .unwrap();
        let input = Value::String(
            (0..len).map(|i| i.to_string()).collect::<Vec<_>>().join(","),
        );
        bencher.bench_local(|| list.parse(divan::black_box(&input)));
    }
}

mod validators {
    use super::*;

    #[divan::bench]
    fn ipv4_cidr(bencher: divan::Bencher) {
        bencher.bench_local(|| {
            ip::is_ip_in_range(divan::black_box("192.168.10.20"), divan::black_box("192.168.0.0/16"))
        });
    }

    #[divan::bench]
    fn semver_best(bencher: divan::Bencher) {
        let versions: Vec<String> = (0..50).map(|i| format!("1.{}.{}", i / 5, i % 5)).collect();
        bencher.bench_local(|| {
            semver::find_version_best(divan::black_box("^1.3 || ~1.7"), versions.as_slice())
        });
    }
}
