use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand, ValueEnum};
use liquid_glass::{
    FragmentFn, GlassController, GlassOpts, HeadlessHost, IdentityFragment, LensShape, Point,
    PostFx, Size, TextureSize, apply_displacement, apply_post, backdrop_filter, default_fragment,
    fragment_fn,
};

#[derive(Parser, Debug)]
#[command(name = "liquid-glass", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the displacement texture for a surface size as a PNG.
    Texture(TextureArgs),
    /// Render the lens over an image (displacement, blur, saturate).
    Preview(PreviewArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Fragment {
    /// Built-in rounded-rect lens.
    Lens,
    /// No displacement.
    Identity,
    /// Lens centered on the pointer.
    Follow,
}

#[derive(Parser, Debug)]
struct TextureArgs {
    /// Surface width in pixels.
    #[arg(long)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Fragment function.
    #[arg(long, value_enum, default_value_t = Fragment::Lens)]
    fragment: Fragment,

    /// Normalized pointer position as `X,Y`.
    #[arg(long)]
    pointer: Option<String>,

    /// Options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the SVG filter markup here.
    #[arg(long)]
    svg: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Blur standard deviation in pixels.
    #[arg(long, default_value_t = 16.0)]
    blur: f64,

    /// Saturation multiplier.
    #[arg(long, default_value_t = 1.2)]
    saturate: f64,

    /// Options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Texture(args) => cmd_texture(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<GlassOpts> {
    match path {
        Some(p) => GlassOpts::from_path(p).with_context(|| format!("load options '{}'", p.display())),
        None => Ok(GlassOpts::default()),
    }
}

fn parse_pointer(s: &str) -> anyhow::Result<Point> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("pointer must be X,Y, got '{s}'");
    };
    let x: f64 = x.trim().parse().with_context(|| format!("pointer x '{x}'"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("pointer y '{y}'"))?;
    Ok(Point::new(x, y))
}

fn cmd_texture(args: TextureArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;
    let pointer = args.pointer.as_deref().map(parse_pointer).transpose()?;
    match args.fragment {
        Fragment::Lens => write_texture(&args, opts, pointer, default_fragment),
        Fragment::Identity => write_texture(&args, opts, pointer, IdentityFragment),
        Fragment::Follow => {
            let shape = LensShape::DEFAULT;
            let follow = fragment_fn(move |uv, p| {
                let c = p.pos();
                let (ix, iy) = (uv.x - c.x, uv.y - c.y);
                let k = shape.pull(ix, iy);
                Point::new(ix * k + c.x, iy * k + c.y)
            });
            write_texture(&args, opts, pointer, follow)
        }
    }
}

fn write_texture<F: FragmentFn>(
    args: &TextureArgs,
    opts: GlassOpts,
    pointer: Option<Point>,
    fragment: F,
) -> anyhow::Result<()> {
    let size = Size::new(f64::from(args.width), f64::from(args.height));
    let mut host = HeadlessHost::new(size);
    let mut ctrl = GlassController::new(fragment, opts)?;
    ctrl.attach(&mut host)?;
    if let Some(p) = pointer {
        host.pointer_move(&mut ctrl, Point::new(p.x * size.width, p.y * size.height))?;
    }
    host.tick(&mut ctrl)?;

    let (Some(texture), Some(graph)) = (ctrl.texture(), ctrl.graph()) else {
        bail!("surface {}x{} produced no texture", args.width, args.height);
    };

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, texture.to_png()?)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    if let Some(svg) = &args.svg {
        ensure_parent_dir(svg)?;
        std::fs::write(svg, graph.to_svg())
            .with_context(|| format!("write svg '{}'", svg.display()))?;
    }

    println!("filter: {}", graph.handle());
    println!("scale: {}", graph.displacement().scale);
    println!(
        "backdrop-filter: {}",
        backdrop_filter(Some(graph.handle()), &PostFx::default())
    );
    eprintln!("wrote {}", args.out.display());
    ctrl.detach(&mut host);
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;
    let src = image::open(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?
        .to_rgba8();
    let (w, h) = src.dimensions();
    let size = TextureSize::new(w, h)?;

    let mut host = HeadlessHost::new(Size::new(f64::from(w), f64::from(h)));
    let mut ctrl = GlassController::new(default_fragment, opts)?;
    ctrl.attach(&mut host)?;
    host.tick(&mut ctrl)?;
    let (Some(texture), Some(graph)) = (ctrl.texture(), ctrl.graph()) else {
        bail!("image {w}x{h} produced no texture");
    };

    let displaced = apply_displacement(src.as_raw(), size, texture, graph.displacement().scale)?;
    let post = PostFx {
        blur_px: args.blur,
        saturate: args.saturate,
    };
    let out = apply_post(&displaced, size, &post)?;

    ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &out,
        w,
        h,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    ctrl.detach(&mut host);
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
