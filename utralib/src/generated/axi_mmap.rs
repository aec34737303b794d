
#![cfg_attr(rustfmt, rustfmt_skip)] // don't format generated files
#![allow(dead_code)]

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Register {
    /// Offset of this register within this CSR, in words
    offset: usize,
    /// Mask of SVD-specified bits for the register
    mask: usize,
}
impl Register {
    pub const fn new(offset: usize, mask: usize) -> Register {
        Register { offset, mask }
    }
    pub const fn offset(&self) -> usize { self.offset }
    pub const fn mask(&self) -> usize { self.mask }
}
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    /// A bitmask we use to AND to the value, unshifted.
    /// E.g. for a width of `3` bits, this mask would be 0b111.
    mask: usize,
    /// Offset of the first bit in this field
    offset: usize,
    /// The register this field is a member of.
    register: Register,
}
impl Field {
    /// Define a new CSR field with the given width at a specified
    /// offset from the start of the register.
    pub const fn new(width: usize, offset: usize, register: Register) -> Field {
        let mask = if width < 32 { (1 << width) - 1 } else { 0xFFFF_FFFF };
        Field {
            mask,
            offset,
            register,
        }
    }
    pub const fn offset(&self) -> usize { self.offset }
    pub const fn mask(&self) -> usize { self.mask }
    pub const fn register(&self) -> Register { self.register }
}

// Physical base addresses of memory regions
pub const HW_ROM_MEM:     usize = 0x00000000;
pub const HW_ROM_MEM_LEN: usize = 65536;
pub const HW_SRAM_MEM:     usize = 0x10000000;
pub const HW_SRAM_MEM_LEN: usize = 8192;
pub const HW_AXI_RAM_MEM:     usize = 0x40000000;
pub const HW_AXI_RAM_MEM_LEN: usize = 4096;
pub const HW_AXI_DP_RAM_A_MEM:     usize = 0x40010000;
pub const HW_AXI_DP_RAM_A_MEM_LEN: usize = 4096;
pub const HW_AXI_DP_RAM_B_MEM:     usize = 0x40020000;
pub const HW_AXI_DP_RAM_B_MEM_LEN: usize = 4096;
pub const HW_AXI_RAM_REG_MEM:     usize = 0x40030000;
pub const HW_AXI_RAM_REG_MEM_LEN: usize = 4096;
pub const HW_AXI_RAM_FIFO_MEM:     usize = 0x40040000;
pub const HW_AXI_RAM_FIFO_MEM_LEN: usize = 4096;
pub const HW_AXI_RAM_XBAR_MEM:     usize = 0x40050000;
pub const HW_AXI_RAM_XBAR_MEM_LEN: usize = 4096;
pub const HW_AXI_RAM_INT_MEM:     usize = 0x40060000;
pub const HW_AXI_RAM_INT_MEM_LEN: usize = 4096;
pub const HW_CDMA0_SRC_MEM:     usize = 0x50000000;
pub const HW_CDMA0_SRC_MEM_LEN: usize = 64;
pub const HW_CDMA0_DST_MEM:     usize = 0x50001000;
pub const HW_CDMA0_DST_MEM_LEN: usize = 64;
pub const HW_CDMA1_SRC_MEM:     usize = 0x50002000;
pub const HW_CDMA1_SRC_MEM_LEN: usize = 64;
pub const HW_CDMA1_DST_MEM:     usize = 0x50003000;
pub const HW_CDMA1_DST_MEM_LEN: usize = 64;
pub const HW_CSR_MEM:     usize = 0xf0000000;
pub const HW_CSR_MEM_LEN: usize = 65536;

// Physical base addresses of registers
pub const HW_CTRL_BASE :   usize = 0xf0000000;
pub const HW_IDENTIFIER_MEM_BASE :   usize = 0xf0000800;
pub const HW_TIMER0_BASE :   usize = 0xf0001000;
pub const HW_UART_BASE :   usize = 0xf0001800;
pub const HW_CDMA0_BASE :   usize = 0xf0002000;
pub const HW_CDMA1_BASE :   usize = 0xf0002800;


pub mod utra {

    pub mod ctrl {
        pub const CTRL_NUMREGS: usize = 3;

        pub const RESET: crate::Register = crate::Register::new(0, 0x3);
        pub const RESET_SOC_RST: crate::Field = crate::Field::new(1, 0, RESET);
        pub const RESET_CPU_RST: crate::Field = crate::Field::new(1, 1, RESET);

        pub const SCRATCH: crate::Register = crate::Register::new(1, 0xffffffff);
        pub const SCRATCH_SCRATCH: crate::Field = crate::Field::new(32, 0, SCRATCH);

        pub const BUS_ERRORS: crate::Register = crate::Register::new(2, 0xffffffff);
        pub const BUS_ERRORS_BUS_ERRORS: crate::Field = crate::Field::new(32, 0, BUS_ERRORS);

        pub const HW_CTRL_BASE: usize = 0xf0000000;
    }

    pub mod identifier_mem {
        pub const IDENTIFIER_MEM_NUMREGS: usize = 1;

        pub const IDENTIFIER_MEM: crate::Register = crate::Register::new(0, 0xff);
        pub const IDENTIFIER_MEM_IDENTIFIER_MEM: crate::Field = crate::Field::new(8, 0, IDENTIFIER_MEM);

        pub const HW_IDENTIFIER_MEM_BASE: usize = 0xf0000800;
    }

    pub mod timer0 {
        pub const TIMER0_NUMREGS: usize = 8;

        pub const LOAD: crate::Register = crate::Register::new(0, 0xffffffff);
        pub const LOAD_LOAD: crate::Field = crate::Field::new(32, 0, LOAD);

        pub const RELOAD: crate::Register = crate::Register::new(1, 0xffffffff);
        pub const RELOAD_RELOAD: crate::Field = crate::Field::new(32, 0, RELOAD);

        pub const EN: crate::Register = crate::Register::new(2, 0x1);
        pub const EN_EN: crate::Field = crate::Field::new(1, 0, EN);

        pub const UPDATE_VALUE: crate::Register = crate::Register::new(3, 0x1);
        pub const UPDATE_VALUE_UPDATE_VALUE: crate::Field = crate::Field::new(1, 0, UPDATE_VALUE);

        pub const VALUE: crate::Register = crate::Register::new(4, 0xffffffff);
        pub const VALUE_VALUE: crate::Field = crate::Field::new(32, 0, VALUE);

        pub const EV_STATUS: crate::Register = crate::Register::new(5, 0x1);
        pub const EV_STATUS_ZERO: crate::Field = crate::Field::new(1, 0, EV_STATUS);

        pub const EV_PENDING: crate::Register = crate::Register::new(6, 0x1);
        pub const EV_PENDING_ZERO: crate::Field = crate::Field::new(1, 0, EV_PENDING);

        pub const EV_ENABLE: crate::Register = crate::Register::new(7, 0x1);
        pub const EV_ENABLE_ZERO: crate::Field = crate::Field::new(1, 0, EV_ENABLE);

        pub const TIMER0_IRQ: usize = 1;
        pub const HW_TIMER0_BASE: usize = 0xf0001000;
    }

    pub mod uart {
        pub const UART_NUMREGS: usize = 8;

        pub const RXTX: crate::Register = crate::Register::new(0, 0xff);
        pub const RXTX_RXTX: crate::Field = crate::Field::new(8, 0, RXTX);

        pub const TXFULL: crate::Register = crate::Register::new(1, 0x1);
        pub const TXFULL_TXFULL: crate::Field = crate::Field::new(1, 0, TXFULL);

        pub const RXEMPTY: crate::Register = crate::Register::new(2, 0x1);
        pub const RXEMPTY_RXEMPTY: crate::Field = crate::Field::new(1, 0, RXEMPTY);

        pub const EV_STATUS: crate::Register = crate::Register::new(3, 0x3);
        pub const EV_STATUS_TX: crate::Field = crate::Field::new(1, 0, EV_STATUS);
        pub const EV_STATUS_RX: crate::Field = crate::Field::new(1, 1, EV_STATUS);

        pub const EV_PENDING: crate::Register = crate::Register::new(4, 0x3);
        pub const EV_PENDING_TX: crate::Field = crate::Field::new(1, 0, EV_PENDING);
        pub const EV_PENDING_RX: crate::Field = crate::Field::new(1, 1, EV_PENDING);

        pub const EV_ENABLE: crate::Register = crate::Register::new(5, 0x3);
        pub const EV_ENABLE_TX: crate::Field = crate::Field::new(1, 0, EV_ENABLE);
        pub const EV_ENABLE_RX: crate::Field = crate::Field::new(1, 1, EV_ENABLE);

        pub const TXEMPTY: crate::Register = crate::Register::new(6, 0x1);
        pub const TXEMPTY_TXEMPTY: crate::Field = crate::Field::new(1, 0, TXEMPTY);

        pub const RXFULL: crate::Register = crate::Register::new(7, 0x1);
        pub const RXFULL_RXFULL: crate::Field = crate::Field::new(1, 0, RXFULL);

        pub const UART_IRQ: usize = 0;
        pub const HW_UART_BASE: usize = 0xf0001800;
    }

    pub mod cdma0 {
        pub const CDMA0_NUMREGS: usize = 5;

        pub const READ_ADDR: crate::Register = crate::Register::new(0, 0xffffffff);
        pub const READ_ADDR_READ_ADDR: crate::Field = crate::Field::new(32, 0, READ_ADDR);

        pub const WRITE_ADDR: crate::Register = crate::Register::new(1, 0xffffffff);
        pub const WRITE_ADDR_WRITE_ADDR: crate::Field = crate::Field::new(32, 0, WRITE_ADDR);

        pub const LEN: crate::Register = crate::Register::new(2, 0xffffffff);
        pub const LEN_LEN: crate::Field = crate::Field::new(32, 0, LEN);

        pub const VALID: crate::Register = crate::Register::new(3, 0x1);
        pub const VALID_VALID: crate::Field = crate::Field::new(1, 0, VALID);

        pub const STATUS: crate::Register = crate::Register::new(4, 0x1);
        pub const STATUS_DONE: crate::Field = crate::Field::new(1, 0, STATUS);

        pub const HW_CDMA0_BASE: usize = 0xf0002000;
    }

    pub mod cdma1 {
        pub const CDMA1_NUMREGS: usize = 5;

        pub const READ_ADDR: crate::Register = crate::Register::new(0, 0xffffffff);
        pub const READ_ADDR_READ_ADDR: crate::Field = crate::Field::new(32, 0, READ_ADDR);

        pub const WRITE_ADDR: crate::Register = crate::Register::new(1, 0xffffffff);
        pub const WRITE_ADDR_WRITE_ADDR: crate::Field = crate::Field::new(32, 0, WRITE_ADDR);

        pub const LEN: crate::Register = crate::Register::new(2, 0xffffffff);
        pub const LEN_LEN: crate::Field = crate::Field::new(32, 0, LEN);

        pub const VALID: crate::Register = crate::Register::new(3, 0x1);
        pub const VALID_VALID: crate::Field = crate::Field::new(1, 0, VALID);

        pub const STATUS: crate::Register = crate::Register::new(4, 0x1);
        pub const STATUS_DONE: crate::Field = crate::Field::new(1, 0, STATUS);

        pub const HW_CDMA1_BASE: usize = 0xf0002800;
    }
}
