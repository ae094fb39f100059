//! Transcoding job construction.
//!
//! The output profile is fixed: one Apple HLS output group producing H.264
//! video and AAC audio in an M3U8 container. Event content never influences
//! codec or container selection.

use aws_sdk_mediaconvert::types::{
    AacCodingMode, AacSettings, AudioCodec, AudioCodecSettings, AudioDefaultSelection,
    AudioDescription, AudioSelector, ContainerSettings, ContainerType, H264RateControlMode,
    H264SceneChangeDetect, H264Settings, HlsGroupSettings, Input, JobSettings, Output,
    OutputGroup, OutputGroupSettings, OutputGroupType, VideoCodec, VideoCodecSettings,
    VideoDescription,
};

/// Audio selector name linking inputs to the audio description.
const AUDIO_SELECTOR: &str = "Audio Selector 1";

/// HLS segment length in seconds.
const SEGMENT_LENGTH: i32 = 1;

/// Minimum trailing segment length in seconds.
const MIN_SEGMENT_LENGTH: i32 = 0;

/// H.264 bitrate ceiling in bits per second.
const MAX_VIDEO_BITRATE: i32 = 2_000_000;

/// AAC bitrate in bits per second.
const AAC_BITRATE: i32 = 96_000;

/// AAC sample rate in Hz.
const AAC_SAMPLE_RATE: i32 = 48_000;

/// Suffix appended to output names.
const NAME_MODIFIER: &str = "_hls";

/// Build the fixed HLS job settings for one input file and destination
/// prefix.
#[must_use]
pub fn build_job_settings(input_url: &str, destination: &str) -> JobSettings {
    let video = VideoDescription::builder()
        .codec_settings(
            VideoCodecSettings::builder()
                .codec(VideoCodec::H264)
                .h264_settings(
                    H264Settings::builder()
                        .rate_control_mode(H264RateControlMode::Qvbr)
                        .scene_change_detect(H264SceneChangeDetect::TransitionDetection)
                        .max_bitrate(MAX_VIDEO_BITRATE)
                        .build(),
                )
                .build(),
        )
        .build();

    let audio = AudioDescription::builder()
        .audio_source_name(AUDIO_SELECTOR)
        .codec_settings(
            AudioCodecSettings::builder()
                .codec(AudioCodec::Aac)
                .aac_settings(
                    AacSettings::builder()
                        .bitrate(AAC_BITRATE)
                        .coding_mode(AacCodingMode::CodingMode20)
                        .sample_rate(AAC_SAMPLE_RATE)
                        .build(),
                )
                .build(),
        )
        .build();

    let output_group = OutputGroup::builder()
        .name("Apple HLS")
        .output_group_settings(
            OutputGroupSettings::builder()
                .r#type(OutputGroupType::HlsGroupSettings)
                .hls_group_settings(
                    HlsGroupSettings::builder()
                        .destination(destination)
                        .segment_length(SEGMENT_LENGTH)
                        .min_segment_length(MIN_SEGMENT_LENGTH)
                        .build(),
                )
                .build(),
        )
        .outputs(
            Output::builder()
                .name_modifier(NAME_MODIFIER)
                .container_settings(
                    ContainerSettings::builder()
                        .container(ContainerType::M3U8)
                        .build(),
                )
                .video_description(video)
                .audio_descriptions(audio)
                .build(),
        )
        .build();

    JobSettings::builder()
        .inputs(
            Input::builder()
                .file_input(input_url)
                .audio_selectors(
                    AUDIO_SELECTOR,
                    AudioSelector::builder()
                        .default_selection(AudioDefaultSelection::Default)
                        .build(),
                )
                .build(),
        )
        .output_groups(output_group)
        .build()
}
