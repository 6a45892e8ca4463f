#![allow(deprecated)]

use libc::{
    CPU_STATE_IDLE, CPU_STATE_MAX, KERN_SUCCESS, PROCESSOR_CPU_LOAD_INFO, host_processor_info,
    mach_host_self, mach_msg_type_number_t, mach_task_self, natural_t, processor_info_array_t,
    vm_address_t, vm_deallocate, vm_size_t,
};

use super::PlatformExtensions;
use crate::system::error::AcquisitionError;
use crate::system::snapshot::CoreTicks;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn core_ticks() -> Result<Vec<CoreTicks>, AcquisitionError> {
        let mut cpu_count: natural_t = 0;
        let mut info: processor_info_array_t = std::ptr::null_mut();
        let mut info_count: mach_msg_type_number_t = 0;

        // SAFETY: all out-pointers are valid for writes; on success the kernel
        // hands us an array of `info_count` integers that we release below.
        let status = unsafe {
            host_processor_info(
                mach_host_self(),
                PROCESSOR_CPU_LOAD_INFO,
                &mut cpu_count,
                &mut info,
                &mut info_count,
            )
        };
        if status != KERN_SUCCESS || info.is_null() {
            return Err(AcquisitionError::Read {
                source: std::io::Error::other(format!("host_processor_info returned {status}")),
            });
        }

        let states = CPU_STATE_MAX as usize;
        // SAFETY: the kernel returned `info_count` contiguous integer_t values.
        let raw = unsafe { std::slice::from_raw_parts(info, info_count as usize) };
        let cores = raw
            .chunks_exact(states)
            .take(cpu_count as usize)
            .map(|ticks| {
                let total = ticks.iter().map(|&t| t as u32 as u64).sum();
                CoreTicks::new(ticks[CPU_STATE_IDLE as usize] as u32 as u64, total)
            })
            .collect();

        // SAFETY: region was allocated by host_processor_info for this task.
        unsafe {
            vm_deallocate(
                mach_task_self(),
                info as vm_address_t,
                (info_count as usize * std::mem::size_of::<libc::integer_t>()) as vm_size_t,
            );
        }

        Ok(cores)
    }
}
