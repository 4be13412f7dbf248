use std::sync::Arc;

use comfy_table::Table;
use dlstream_epoch::{DemuxOutput, Epoch};
use dlstream_frame::ChannelTable;
use dlstream_pipeline::{epoch_chain, PipelineConfig};
use dlstream_sample::Sample;
use tracing::info;

use crate::cmd::{open_source, raw_unsupported, DecodeArgs};
use crate::exit::{io_error, pipeline_error, CliResult, SUCCESS};
use crate::output::{
    epoch_line, epoch_row, new_table, print_json, sample_line, sample_row, OutputFormat,
    EPOCH_HEADER, EPOCH_SCHEMA, SAMPLE_HEADER, SAMPLE_SCHEMA,
};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    if matches!(format, OutputFormat::Raw) {
        return Err(raw_unsupported("decode"));
    }

    let source = open_source(&args.input)?;
    let config = PipelineConfig {
        queue_capacity: args.queue_capacity as usize,
        ..PipelineConfig::default()
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("dlstream-worker")
        .build()
        .map_err(|err| io_error("failed to start runtime", err))?;

    runtime.block_on(async move {
        let mut chain = epoch_chain(source, Arc::new(ChannelTable::standard()), &config);
        let mut view = View::new(format, args.passthrough);

        while let Some(output) = chain.recv().await {
            match output {
                DemuxOutput::Epoch(epoch) => view.epoch(&epoch),
                DemuxOutput::Sample(sample) if args.passthrough => view.sample(&sample),
                DemuxOutput::Sample(_) => {}
            }
            if args.count.is_some_and(|limit| view.epochs >= limit) {
                break;
            }
        }

        // Whatever was decoded before a failure is still printed.
        let result = chain.join().await;
        view.finish();
        info!(epochs = view.epochs, samples = view.samples, "decode finished");
        result.map_err(|err| pipeline_error("decode failed", err))
    })?;

    Ok(SUCCESS)
}

struct View {
    format: OutputFormat,
    epoch_table: Option<Table>,
    sample_table: Option<Table>,
    epochs: usize,
    samples: usize,
}

impl View {
    fn new(format: OutputFormat, passthrough: bool) -> Self {
        let tables = matches!(format, OutputFormat::Table);
        Self {
            format,
            epoch_table: tables.then(|| new_table(EPOCH_HEADER.to_vec())),
            sample_table: (tables && passthrough).then(|| new_table(SAMPLE_HEADER.to_vec())),
            epochs: 0,
            samples: 0,
        }
    }

    fn epoch(&mut self, epoch: &Epoch) {
        self.epochs += 1;
        match self.format {
            OutputFormat::Json => print_json(EPOCH_SCHEMA, epoch),
            OutputFormat::Pretty => println!("{}", epoch_line(epoch)),
            OutputFormat::Table => {
                if let Some(table) = self.epoch_table.as_mut() {
                    table.add_row(epoch_row(epoch));
                }
            }
            OutputFormat::Raw => {}
        }
    }

    fn sample(&mut self, sample: &Sample) {
        self.samples += 1;
        match self.format {
            OutputFormat::Json => print_json(SAMPLE_SCHEMA, sample),
            OutputFormat::Pretty => println!("{}", sample_line(sample)),
            OutputFormat::Table => {
                if let Some(table) = self.sample_table.as_mut() {
                    table.add_row(sample_row(sample));
                }
            }
            OutputFormat::Raw => {}
        }
    }

    fn finish(&mut self) {
        for table in [self.epoch_table.take(), self.sample_table.take()]
            .into_iter()
            .flatten()
        {
            println!("{table}");
        }
    }
}
