use utralib::*;

#[macro_use]
pub mod debug;

#[global_allocator]
static ALLOCATOR: linked_list_allocator::LockedHeap = linked_list_allocator::LockedHeap::empty();

// Integrated SRAM: .data and .bss at the bottom, then the heap, then the
// stack growing down from the top.
pub const RAM_BASE: usize = HW_SRAM_MEM;
pub const RAM_SIZE: usize = HW_SRAM_MEM_LEN;
pub const STACK_LEN: usize = 4 * 1024;
pub const HEAP_LEN: usize = 2 * 1024;
pub const HEAP_START: usize = RAM_BASE + RAM_SIZE - STACK_LEN - HEAP_LEN;

pub fn early_init() {
    // setup interrupts & enable IRQ handler for characters
    crate::irq::irq_setup();
    crate::debug::Uart::enable_rx(true);
    crate::irq::enable_irq(utra::uart::UART_IRQ);

    setup_alloc();

    if let Err(e) = debug::init_logger() {
        crate::println!("logger not installed: {:?}", e);
    }
}

pub fn setup_alloc() {
    extern "C" {
        static _ebss: u8;
    }
    // safety: only the address of the linker symbol is taken
    let ebss = unsafe { core::ptr::addr_of!(_ebss) as usize };
    if ebss > HEAP_START {
        panic!("static data ends at {:x}, past the heap at {:x}", ebss, HEAP_START);
    }
    // safety: the heap range is reserved by the layout above and handed out exactly once
    unsafe {
        ALLOCATOR.lock().init(HEAP_START as *mut u8, HEAP_LEN);
    }
}

// Install a panic handler when not running tests.
mod panic_handler {
    use core::panic::PanicInfo;
    #[panic_handler]
    fn handle_panic(_arg: &PanicInfo) -> ! {
        crate::println!("{}", _arg);
        loop {}
    }
}
