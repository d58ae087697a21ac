use serial;
use structopt;

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use structopt::StructOpt;
use serial::core::{CharSize, BaudRate, StopBits, FlowControl, SerialDevice, SerialPortSettings};

use ttywrite::frame::{find_code, Encoder};
use ttywrite::image::{Op, Plan};
use ttywrite::parsers::{parse_address, parse_width, parse_stop_bits, parse_flow_control, parse_baud_rate};

#[derive(StructOpt, Debug)]
#[structopt(about = "Send an ELF or raw image to the serial bootloader.")]
struct Opt {
    #[structopt(help = "ELF file or raw binary to send", parse(from_os_str))]
    input: PathBuf,

    #[structopt(help = "Path to TTY device", parse(from_os_str))]
    tty_path: PathBuf,

    #[structopt(short = "b", long = "baud", parse(try_from_str = "parse_baud_rate"),
                help = "Set baud rate", default_value = "115200")]
    baud_rate: BaudRate,

    #[structopt(short = "t", long = "timeout", parse(try_from_str),
                help = "Set timeout in seconds", default_value = "10")]
    timeout: u64,

    #[structopt(short = "w", long = "width", parse(try_from_str = "parse_width"),
                help = "Set data character width in bits", default_value = "8")]
    char_width: CharSize,

    #[structopt(short = "f", long = "flow-control", parse(try_from_str = "parse_flow_control"),
                help = "Enable flow control ('hardware' or 'software')", default_value = "none")]
    flow_control: FlowControl,

    #[structopt(short = "s", long = "stop-bits", parse(try_from_str = "parse_stop_bits"),
                help = "Set number of stop bits", default_value = "1")]
    stop_bits: StopBits,

    #[structopt(short = "r", long = "raw", help = "Send the input as a raw binary even if it is an ELF")]
    raw: bool,

    #[structopt(short = "a", long = "address", parse(try_from_str = "parse_address"),
                help = "Load and entry address of a raw binary", default_value = "0")]
    address: u32,

    #[structopt(short = "n", long = "dry-run", help = "Print what would be sent without opening the TTY")]
    dry_run: bool,
}

fn progress_fn(op: &Op) {
    println!("{}", op);
}

fn warn_on_codes(plan: &Plan) {
    for op in &plan.ops {
        if let Op::Segment { name, data, .. } = op {
            if let Some((offset, code)) = find_code(data) {
                println!(
                    "warning: {} contains the {} code at offset {:#x}; the loader will end the segment there",
                    name, code, offset
                );
            }
        }
    }
}

fn main() {
    let opt = Opt::from_args();

    let bytes = std::fs::read(&opt.input).unwrap_or_else(|e| {
        eprintln!("error: cannot read {}: {}", opt.input.display(), e);
        process::exit(1);
    });

    let plan = if opt.raw {
        Plan::raw(&bytes, opt.address)
    } else {
        Plan::from_bytes(&bytes, opt.address).unwrap_or_else(|e| {
            eprintln!("error: {}: {}", opt.input.display(), e);
            process::exit(1);
        })
    };

    warn_on_codes(&plan);
    if !plan.skipped.is_empty() {
        println!("Skipped sections: {}", plan.skipped.join(" "));
    }

    if opt.dry_run {
        plan.ops.iter().for_each(progress_fn);
        println!("Starting program at address: {:#x}", plan.entry);
        println!("{} bytes on the wire", plan.wire_len());
        return;
    }

    let mut port = serial::open(&opt.tty_path).expect("path points to invalid TTY");

    port.set_timeout(Duration::from_secs(opt.timeout)).expect("error setting timeout");
    let mut settings = port.read_settings().expect("error reading settings");
    settings.set_baud_rate(opt.baud_rate).expect("error setting baud rate");
    settings.set_stop_bits(opt.stop_bits);
    settings.set_flow_control(opt.flow_control);
    settings.set_char_size(opt.char_width);
    port.write_settings(&settings).expect("error writing settings");

    let mut encoder = Encoder::new(&mut port);
    plan.transmit(&mut encoder, progress_fn).expect("transmit failed");
    println!("Starting program at address: {:#x}", plan.entry);
    println!("{} bytes sent", encoder.written());
}
