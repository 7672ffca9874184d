//! Benchmarks for whole-buffer and incremental colorization.
//!
//! Run with: cargo bench -p tincture-modes

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tincture_core::{ColorizedText, Colorizer, ModeFlags};
use tincture_modes::{MarkupColorizer, PerlColorizer};

// =============================================================================
// Test Data
// =============================================================================

const HTML_CHUNK: &str = r#"<!DOCTYPE html>
<html lang="en">
<!-- navigation
     spans two lines -->
<body class="main" data-x='1'>
<p title="a &amp; b">Fish &amp; chips &#169; 2024</p>
<script type="text/javascript">
  var re = /ab+c/gi; /* block
     comment */ let s = "str";
</script>
</body>
</html>
"#;

const PERL_CHUNK: &str = r#"#!/usr/bin/perl -w
use strict;
my ($x, @list, %map) = (10, (1, 2), ());
$x =~ s/foo/bar/g if -e $file;
print <<EOT;
Hello $x
EOT
my $s = 'multi
line';
=head1 NAME

Example

=cut
tr[a-z][A-Z];
"#;

fn buffer(chunk: &str, lines: usize) -> String {
    chunk.lines().cycle().take(lines).collect::<Vec<_>>().join("\n")
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_full_pass(c: &mut Criterion, name: &str, colorizer: &dyn Colorizer, chunk: &str) {
    let mut group = c.benchmark_group(format!("colorize/{name}"));
    for lines in [100, 1_000, 10_000] {
        let text = buffer(chunk, lines);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &text, |b, text| {
            b.iter(|| ColorizedText::from_text(colorizer, black_box(text), ModeFlags::empty()));
        });
    }
    group.finish();
}

fn bench_markup(c: &mut Criterion) {
    bench_full_pass(c, "markup", &MarkupColorizer::new(), HTML_CHUNK);
}

fn bench_perl(c: &mut Criterion) {
    bench_full_pass(c, "perl", &PerlColorizer::new(), PERL_CHUNK);
}

fn bench_update_line(c: &mut Criterion) {
    let colorizer = MarkupColorizer::new();
    let text = buffer(HTML_CHUNK, 1_000);
    let before: Vec<&str> = text.lines().collect();
    let mut after = before.clone();
    after[500] = "<p class=\"edited\">x</p>";
    let cached = ColorizedText::from_lines(&colorizer, &before, ModeFlags::empty());

    c.bench_function("update_line/markup/1000", |b| {
        b.iter(|| {
            let mut text = cached.clone();
            black_box(text.update_line(&colorizer, black_box(&after), 500))
        });
    });
}

criterion_group!(benches, bench_markup, bench_perl, bench_update_line);
criterion_main!(benches);
