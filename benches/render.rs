use criterion::{Criterion, criterion_group, criterion_main};
use codefence::{CodeBlock, DualTheme, HighlightConfig, PlainTokenizer, SyntaxHighlighter, Theme};

const THEME: &str = r##"{
    "name": "bench",
    "type": "dark",
    "tokenColors": [
        {"scope": "text", "settings": {"foreground": "#E1E4E8"}},
        {"scope": "text.plain", "settings": {"fontStyle": "italic"}}
    ]
}"##;

fn sample_block(lines: usize) -> String {
    let mut code = String::new();
    for i in 0..lines {
        code.push_str(&format!("let value_{i} = compute({i}) < limit && other;"));
        match i % 10 {
            3 => code.push_str(" // [!code highlight]"),
            5 => code.push_str(" // [!code ++ focus]"),
            7 => code.push_str(" // [!code error]"),
            _ => {}
        }
        code.push('\n');
    }
    code
}

fn render_many_blocks_benchmark(c: &mut Criterion) {
    let theme = Theme::from_json(THEME).unwrap();
    let stylist = DualTheme {
        light: theme.clone(),
        dark: theme,
    };
    let tokenizer = PlainTokenizer::new();
    let code = sample_block(50);

    c.bench_function("render 100 blocks with one highlighter", |b| {
        let mut highlighter =
            SyntaxHighlighter::new(&tokenizer, &stylist, HighlightConfig::default());
        b.iter(|| {
            let mut out = String::new();
            for _ in 0..100 {
                let mut block = CodeBlock::fenced("rust:line-numbers=1{1-4}[bench]", &code);
                highlighter.render(&mut block, &mut out).unwrap();
            }
            std::hint::black_box(out);
        })
    });
}

fn render_large_block_benchmark(c: &mut Criterion) {
    let theme = Theme::from_json(THEME).unwrap();
    let stylist = DualTheme {
        light: theme.clone(),
        dark: theme,
    };
    let tokenizer = PlainTokenizer::new();
    let code = sample_block(5_000);

    c.bench_function("render a 5000 lines block", |b| {
        let mut highlighter =
            SyntaxHighlighter::new(&tokenizer, &stylist, HighlightConfig::default());
        b.iter(|| {
            let mut out = String::new();
            let mut block = CodeBlock::fenced("rust:line-numbers", &code);
            highlighter.render(&mut block, &mut out).unwrap();
            std::hint::black_box(out);
        })
    });
}

criterion_group!(
    benches,
    render_many_blocks_benchmark,
    render_large_block_benchmark
);
criterion_main!(benches);
