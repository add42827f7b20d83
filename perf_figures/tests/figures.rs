use std::ffi::OsStr;
use std::process::{Command, Output};

const FIGURES: [(&str, &str); 7] = [
    (
        "roofline_example_simple",
        env!("CARGO_BIN_EXE_roofline_example_simple"),
    ),
    ("roofline_dmvm", env!("CARGO_BIN_EXE_roofline_dmvm")),
    (
        "roofline_example_gemm_models",
        env!("CARGO_BIN_EXE_roofline_example_gemm_models"),
    ),
    (
        "roofline_example_gemm_improved_tiling_vector",
        env!("CARGO_BIN_EXE_roofline_example_gemm_improved_tiling_vector"),
    ),
    (
        "saturating_resource",
        env!("CARGO_BIN_EXE_saturating_resource"),
    ),
    ("scalable_resource", env!("CARGO_BIN_EXE_scalable_resource")),
    (
        "sum_reduction_throughput_annotated",
        env!("CARGO_BIN_EXE_sum_reduction_throughput_annotated"),
    ),
];

fn run<I, S>(binary: &str, arguments: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(binary)
        .args(arguments)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn no_arguments_is_usage_error() {
    for (name, binary) in FIGURES {
        let output = Command::new(binary).output().unwrap();
        assert_eq!(output.status.code(), Some(2), "{}", name);
        assert!(!output.stderr.is_empty(), "{}", name);
    }
}

#[test]
fn renders_deterministically() {
    let dir = tempfile::tempdir().unwrap();
    for (name, binary) in FIGURES {
        let path = dir.path().join(format!("{}.tex", name));
        assert!(run(binary, [&path]).status.success(), "{}", name);
        let first = std::fs::read(&path).unwrap();
        assert!(run(binary, [&path]).status.success(), "{}", name);
        let second = std::fs::read(&path).unwrap();
        assert!(!first.is_empty(), "{}", name);
        assert_eq!(first, second, "{}", name);
    }
}

#[test]
fn missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does").join("not").join("exist.tex");
    for (name, binary) in FIGURES {
        assert!(!run(binary, [&path]).status.success(), "{}", name);
    }
    assert!(!path.exists());
}

#[test]
fn unsupported_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roofline.xyz");
    let output = run(FIGURES[0].1, [&path]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("roofline.xyz"));
    assert!(!path.exists());
}

#[test]
fn extra_arguments_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dmvm.tex");
    let output = run(
        env!("CARGO_BIN_EXE_roofline_dmvm"),
        [path.as_os_str(), OsStr::new("--dpi"), OsStr::new("300"), OsStr::new("extra")],
    );
    assert!(output.status.success());
    assert!(path.exists());
}

#[test]
fn dmvm_skips_out_of_range_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dmvm.tex");
    assert!(run(env!("CARGO_BIN_EXE_roofline_dmvm"), [&path]).status.success());
    let source = std::fs::read_to_string(&path).unwrap();
    assert!(source.contains("Triad BW 12 GB/s"));
    assert!(source.contains("1 scalar op/cycle 3 Gflop/s"));
    assert!(!source.contains("2 AVX FMA/cycle"));
    assert!(source.contains("legend entries={{O0},{O3},{O3 blocked}}"));
}

#[test]
fn svg_renders_deterministically() {
    let dir = tempfile::tempdir().unwrap();
    for (name, binary) in [
        ("roofline_dmvm", env!("CARGO_BIN_EXE_roofline_dmvm")),
        (
            "sum_reduction_throughput_annotated",
            env!("CARGO_BIN_EXE_sum_reduction_throughput_annotated"),
        ),
    ] {
        let path = dir.path().join(format!("{}.svg", name));
        assert!(run(binary, [&path]).status.success(), "{}", name);
        let first = std::fs::read(&path).unwrap();
        assert!(run(binary, [&path]).status.success(), "{}", name);
        let second = std::fs::read(&path).unwrap();
        assert!(!first.is_empty(), "{}", name);
        assert_eq!(first, second, "{}", name);
    }
}

#[test]
fn dmvm_svg_skips_out_of_range_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dmvm.svg");
    assert!(run(env!("CARGO_BIN_EXE_roofline_dmvm"), [&path]).status.success());
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("Triad BW 12 GB/s"));
    assert!(svg.contains("O3 blocked"));
    assert!(!svg.contains("2 AVX FMA/cycle"));
}

#[test]
fn sum_reduction_svg_has_peak_legend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sum.svg");
    let binary = env!("CARGO_BIN_EXE_sum_reduction_throughput_annotated");
    assert!(run(binary, [&path]).status.success());
    let svg = std::fs::read_to_string(&path).unwrap();
    for label in ["SIMD (AVX)", "L1 Peak", "L2 Peak", "L3 Peak", "RAM Peak"] {
        assert!(svg.contains(label), "{}", label);
    }
}

#[test]
fn png_renders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saturating.png");
    assert!(run(env!("CARGO_BIN_EXE_saturating_resource"), [&path]).status.success());
    let png = std::fs::read(&path).unwrap();
    assert!(png.starts_with(b"\x89PNG"));
}

#[test]
fn png_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodir").join("dmvm.png");
    let output = run(env!("CARGO_BIN_EXE_roofline_dmvm"), [&path]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Render"));
    assert!(!path.exists());
}
