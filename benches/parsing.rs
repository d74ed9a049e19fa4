//! Performance benchmarks for inkmark
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use inkmark::{InlineParser, NodeKind, Options, Range, Tree, parse_inline, tokenize};

/// Sample paragraph texts of various sizes
mod samples {
    pub const TINY: &str = "Hello, **world**!";

    pub const SMALL: &str = "This is a paragraph with *emphasis* and **strong** text, \
`inline code` and [a link](https://example.com).";

    pub const MIXED: &str = r#"The parser handles *emphasis*, **strong**, ~~strike~~ and `code`,
links like [GitHub](https://github.com "Code hosting") and images such as
![logo](/img/logo.png), raw <span class="x">HTML</span>, autolinks like
<https://docs.rs> and bare ones like www.example.com or user@example.com,
formulas such as $e^{i\pi} + 1 = 0$, entities like &copy; and &#169;,
hard breaks\
and soft breaks."#;

    /// A long paragraph built by repeating the mixed sample
    pub fn large() -> String {
        MIXED.repeat(100)
    }

    /// Many potential opener/closer pairs
    pub fn pathological_emphasis() -> String {
        "*a ".repeat(1000) + &"b* ".repeat(1000)
    }

    /// Deeply nested brackets
    pub fn pathological_brackets() -> String {
        "[".repeat(1000) + "x" + &"](/u)".repeat(1000)
    }

    /// Many unclosed backtick runs of different lengths
    pub fn pathological_backticks() -> String {
        (1..=32).map(|n| "`".repeat(n) + "a ").collect::<String>().repeat(30)
    }

    /// One long word with a bare-link start after every parenthesis
    pub fn pathological_word_starts() -> String {
        "(a".repeat(8000)
    }

    /// Formula openers that never close
    pub fn pathological_dollars() -> String {
        "$a ".repeat(8000)
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_inline");
    let options = Options::default();

    let large = samples::large();
    let inputs: [(&str, &str); 4] = [
        ("tiny", samples::TINY),
        ("small", samples::SMALL),
        ("mixed", samples::MIXED),
        ("large", &large),
    ];
    for (name, input) in inputs {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, s| {
            b.iter(|| parse_inline(black_box(s), &options))
        });
    }

    group.finish();
}

fn bench_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("phases");
    let input = samples::large();
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("tokenize", |b| b.iter(|| tokenize(black_box(&input))));

    let (tokens, _) = tokenize(&input);
    let parser = InlineParser::new(Options::default());
    group.bench_function("build", |b| {
        b.iter(|| {
            let mut tree = Tree::new();
            let root = tree.root();
            let para = tree.append(root, NodeKind::Paragraph, Range::from_usize(0, input.len()));
            parser.build(black_box(&tokens), &mut tree, para);
            tree
        })
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20); // Fewer samples for slow cases
    let options = Options::default();

    let emphasis = samples::pathological_emphasis();
    group.throughput(Throughput::Bytes(emphasis.len() as u64));
    group.bench_function("emphasis_explosion", |b| {
        b.iter(|| parse_inline(black_box(&emphasis), &options))
    });

    let brackets = samples::pathological_brackets();
    group.throughput(Throughput::Bytes(brackets.len() as u64));
    group.bench_function("nested_brackets", |b| {
        b.iter(|| parse_inline(black_box(&brackets), &options))
    });

    let backticks = samples::pathological_backticks();
    group.throughput(Throughput::Bytes(backticks.len() as u64));
    group.bench_function("unclosed_backticks", |b| {
        b.iter(|| parse_inline(black_box(&backticks), &options))
    });

    let word_starts = samples::pathological_word_starts();
    group.throughput(Throughput::Bytes(word_starts.len() as u64));
    group.bench_function("word_starts", |b| {
        b.iter(|| parse_inline(black_box(&word_starts), &options))
    });

    let dollars = samples::pathological_dollars();
    group.throughput(Throughput::Bytes(dollars.len() as u64));
    group.bench_function("unclosed_dollars", |b| {
        b.iter(|| parse_inline(black_box(&dollars), &options))
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_phases, bench_pathological);
criterion_main!(benches);
