//! Compiles generated headers with the system C++ compiler.
//!
//! The hand-built variant is exercised through a harness that counts the
//! constructions and destructions of a user-defined alternative. Tests
//! return early when no `c++` is on `PATH`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use dtgen_codegen::generator::cpp::CppGenerator;
use dtgen_codegen::generator::{CodeGenerator, GeneratedCode, GeneratorConfig, ProvenanceMode};
use dtgen_codegen::ir::{DataType, Field, LanguageOptions, Version, EXCEPTIONS_ENABLED};
use dtgen_codegen::TypeDescriptor;
use tempfile::TempDir;

const COMPILER: &str = "c++";

/// Alternative type with instance counters.
const COUNTER_HEADER: &str = r#"#ifndef HARNESS_COUNTER_1_0_HPP
#define HARNESS_COUNTER_1_0_HPP

namespace harness
{
struct Counter_1_0 final
{
    static int live;
    static int constructed;
    static int destroyed;

    int value = 0;

    Counter_1_0() { ++live; ++constructed; }
    explicit Counter_1_0(int v) : value(v) { ++live; ++constructed; }
    Counter_1_0(const Counter_1_0& other) : value(other.value) { ++live; ++constructed; }
    Counter_1_0(Counter_1_0&& other) noexcept : value(other.value)
    {
        other.value = -1;
        ++live;
        ++constructed;
    }
    Counter_1_0& operator=(const Counter_1_0&) = default;
    Counter_1_0& operator=(Counter_1_0&&) = default;
    ~Counter_1_0() { --live; ++destroyed; }
};

int Counter_1_0::live = 0;
int Counter_1_0::constructed = 0;
int Counter_1_0::destroyed = 0;
} // namespace harness

#endif
"#;

const LIFECYCLE_MAIN: &str = r#"#include "harness/Slot_1_0.hpp"

#include <cstdio>
#include <type_traits>
#include <utility>

#define CHECK(cond)                                                  \
    do                                                               \
    {                                                                \
        if (!(cond))                                                 \
        {                                                            \
            std::printf("check failed at line %d: %s\n", __LINE__, #cond); \
            return 1;                                                \
        }                                                            \
    } while (0)

using harness::Counter_1_0;
using harness::Slot_1_0;

static_assert(std::is_nothrow_move_constructible<Slot_1_0>::value,
              "moves of nothrow alternatives are noexcept");

int main()
{
    {
        Slot_1_0 slot;
        CHECK(slot.union_value.index() == Slot_1_0::IndexOf::a);
        CHECK(slot.is_a());
        CHECK(*slot.get_a_if() == 0);
        CHECK(slot.get_b_if() == nullptr);
        CHECK(slot.get_c_if() == nullptr);

        slot.set_b(3.5F);
        CHECK(slot.is_b());
        CHECK(*slot.get_b_if() == 3.5F);
        CHECK(slot.get_a_if() == nullptr);

        slot.union_value.emplace<Slot_1_0::IndexOf::c>(7);
        CHECK(Counter_1_0::live == 1);

        Slot_1_0 copy = slot;
        CHECK(Counter_1_0::live == 2);
        copy.get_c_if()->value = 9;
        CHECK(slot.get_c_if()->value == 7);

        Slot_1_0 moved = std::move(slot);
        CHECK(slot.union_value.valueless());
        CHECK(moved.get_c_if()->value == 7);
        CHECK(Counter_1_0::live == 2);

        slot = copy;
        CHECK(slot.get_c_if()->value == 9);
        CHECK(Counter_1_0::live == 3);

        copy = std::move(moved);
        CHECK(moved.union_value.valueless());
        CHECK(copy.get_c_if()->value == 7);
        CHECK(Counter_1_0::live == 2);

        moved.set_a(1);
        CHECK(Counter_1_0::live == 2);
        slot.set_a(2);
        CHECK(Counter_1_0::live == 1);
    }
    CHECK(Counter_1_0::live == 0);
    CHECK(Counter_1_0::constructed == Counter_1_0::destroyed);
    std::printf("constructed=%d destroyed=%d\n", Counter_1_0::constructed, Counter_1_0::destroyed);
    return 0;
}
"#;

fn compiler_available() -> bool {
    let found = Command::new(COMPILER).arg("--version").output().is_ok();
    if !found {
        eprintln!("skipping: no {} on PATH", COMPILER);
    }
    found
}

fn pinned() -> GeneratorConfig {
    GeneratorConfig::default()
        .with_provenance(ProvenanceMode::Pinned("2024-05-01T12:00:00Z".into()))
}

fn write_all(root: &Path, files: &[GeneratedCode]) {
    for file in files {
        let path = root.join(&file.path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, &file.code).unwrap();
    }
}

/// Include directory holding the default support library.
fn include_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let support = CppGenerator::new()
        .generate_support(&LanguageOptions::new(), &pinned())
        .unwrap();
    write_all(dir.path(), &support);
    dir
}

fn compile(include: &Path, source: &Path, extra: &[&str]) -> Output {
    Command::new(COMPILER)
        .arg("-std=c++14")
        .arg("-I")
        .arg(include)
        .args(extra)
        .arg(source)
        .output()
        .unwrap()
}

fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_fallback_variant_lifecycle() {
    if !compiler_available() {
        return;
    }
    let include = include_dir();
    fs::create_dir_all(include.path().join("harness")).unwrap();
    fs::write(include.path().join("harness/Counter_1_0.hpp"), COUNTER_HEADER).unwrap();

    let slot = TypeDescriptor::union("harness.Slot", Version::new(1, 0))
        .with_field(Field::new("a", DataType::unsigned(8)))
        .with_field(Field::new("b", DataType::float(32)))
        .with_field(Field::new(
            "c",
            DataType::composite("harness.Counter", Version::new(1, 0)),
        ));
    let header = CppGenerator::new().generate(&slot, &pinned()).unwrap();
    assert!(header.code.contains("class VariantType final"));
    write_all(include.path(), &[header]);

    let work = TempDir::new().unwrap();
    let main = write_source(work.path(), "main.cpp", LIFECYCLE_MAIN);
    let binary = work.path().join("lifecycle");
    let output = compile(include.path(), &main, &["-o", binary.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "compilation failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let run = Command::new(&binary).output().unwrap();
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(run.status.success(), "{}", stdout);
    assert!(stdout.starts_with("constructed="), "{}", stdout);
}

#[test]
fn test_option_mismatch_fails_the_build() {
    if !compiler_available() {
        return;
    }
    let include = include_dir();
    let generator = CppGenerator::new();
    let good = TypeDescriptor::new("harness.Good", Version::new(1, 0))
        .with_field(Field::new("x", DataType::unsigned(16)))
        .with_source_path("harness/Good.1.0.dsdl");
    let bad = TypeDescriptor::new("harness.Bad", Version::new(1, 0))
        .with_field(Field::new("x", DataType::unsigned(16)))
        .with_source_path("harness/Bad.1.0.dsdl")
        .with_option(EXCEPTIONS_ENABLED, true);
    write_all(
        include.path(),
        &[
            generator.generate(&good, &pinned()).unwrap(),
            generator.generate(&bad, &pinned()).unwrap(),
        ],
    );

    let work = TempDir::new().unwrap();
    let good_main = write_source(
        work.path(),
        "good.cpp",
        "#include \"harness/Good_1_0.hpp\"\nint main() { return 0; }\n",
    );
    let output = compile(include.path(), &good_main, &["-fsyntax-only"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bad_main = write_source(
        work.path(),
        "bad.cpp",
        "#include \"harness/Bad_1_0.hpp\"\nint main() { return 0; }\n",
    );
    let output = compile(include.path(), &bad_main, &["-fsyntax-only"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(
        stderr.contains("harness/Bad.1.0.dsdl is trying to use a support library"),
        "{}",
        stderr
    );
    assert!(stderr.contains("exceptions_enabled"), "{}", stderr);
}
